pub mod lending_pool;
pub mod swap_router;
