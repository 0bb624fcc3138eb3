pub mod functions;
pub mod scenarios;

pub mod prelude {
    pub use crate::{functions::*, scenarios::*};
}
