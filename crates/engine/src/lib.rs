pub mod error;
pub mod grid;
pub mod session;
pub mod window;
pub mod workbook;

pub use error::EditError;
pub use grid::{Grid, Row};
pub use session::{EditSession, LoadTicket};
pub use window::{PreviewRow, Window, DEFAULT_PREVIEW_EDGE};
pub use workbook::{Sheet, SourceKind, Workbook};
