pub mod choropleth;
pub mod color_scale;
pub mod error;
mod html;
