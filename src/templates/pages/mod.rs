pub mod dataset;
pub mod home;
pub mod results;

pub use dataset::{dataset_page, DatasetVm};
pub use home::home_page;
pub use results::{results_page, ResultsVm};
