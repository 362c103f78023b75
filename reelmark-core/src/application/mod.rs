pub mod home_feed;
pub mod unit_of_work;

pub use home_feed::{HomeFeed, HomeSections};
pub use unit_of_work::WatchUnitOfWork;
