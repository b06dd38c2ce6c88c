//! Small formatting helpers shared by the views, the markdown renderer and
//! the feed serializer.

mod date;
mod html;

pub use date::*;
pub use html::*;
