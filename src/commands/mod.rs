mod media;
mod register;
mod show;
mod sync;
mod webhook;

pub use media::{gallery, thumbnail};
pub use register::{add_key, register};
pub use show::show;
pub use sync::{sync, sync_all};
pub use webhook::webhook;
