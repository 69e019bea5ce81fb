//! Registry implementations.
//!
//! The domain layer defines the `ConnectionRegistry` trait; the concrete
//! implementations live here. The usecase layer depends on the trait, never
//! on an implementation directly (dependency inversion).

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
