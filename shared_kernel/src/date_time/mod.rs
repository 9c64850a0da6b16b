pub mod feed_clock;
