pub mod amadeus;
