/// UI layer: panels (menus, view/variable selection) and chart rendering.
/// Consumes [`crate::data::view::Payload`] values; all styling lives here.
pub mod charts;
pub mod panels;
