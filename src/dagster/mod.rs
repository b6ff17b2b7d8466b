pub mod browser;
pub mod executor;
pub mod parser;
pub mod traits;

pub use executor::GraphqlExecutor;
pub use traits::DagsterExecutor;
