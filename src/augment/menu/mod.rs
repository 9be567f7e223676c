//! Floating suggestion menu.
//!
//! - [`controller`] owns the `Hidden`/`Visible` state machine
//! - [`position`] places the panel relative to its anchor
//! - [`render`] turns a visible menu into a [`PanelView`](crate::host::PanelView)

pub mod controller;
pub mod position;
pub mod render;

pub use controller::{
    Direction, MenuController, MenuOrigin, MenuState, NavigationPolicy, Selection, Transition,
    VisibleMenu,
};
pub use position::{PanelGeometry, ZIndexStrategy, place, stacking_order};
pub use render::{announcement, render};
