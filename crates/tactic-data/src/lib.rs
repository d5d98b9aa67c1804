//! Historical bar feeds.

mod csv_feed;

pub use csv_feed::CsvBarFeed;
