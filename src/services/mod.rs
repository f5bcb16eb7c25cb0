pub mod changes;
pub mod distribution;
pub mod enrichment;
pub mod hold;
pub mod orders;
pub mod reference_data;
pub mod search;
