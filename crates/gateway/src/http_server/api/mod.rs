pub mod download;
pub mod getpath;
pub mod readme;
pub mod refresh;
pub mod site;
