pub mod compare;
pub mod country;
pub mod export;
pub mod overview;
pub mod setup;
pub mod share;
pub mod stats;
pub mod top;
pub mod trend;
pub mod ui;
