pub mod quality_rank;
