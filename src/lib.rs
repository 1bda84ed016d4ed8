pub mod fonts;
pub mod icon_gen;
pub mod layout;
pub mod render;
pub mod shapes;
