/*!
 * Monitoring
 * Structured tracing setup for the simulator
 */

mod tracer;

pub use tracer::init_tracing;
