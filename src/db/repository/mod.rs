pub mod bat;
pub mod bref;
pub mod permit;
pub mod run;

pub use bat::*;
pub use bref::*;
pub use permit::*;
pub use run::*;
