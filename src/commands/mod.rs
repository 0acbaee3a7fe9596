pub mod commit;
pub mod find_reference_tests;

pub use commit::*;
pub use find_reference_tests::*;
pub use propose_tests::*;
