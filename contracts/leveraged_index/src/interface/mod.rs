pub mod leveraged_index;
