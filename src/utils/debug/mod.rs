/*
 * Debugging and Logging Utilities
 *
 * In-memory logging backend for the scheduler.
 */

pub mod logger;
