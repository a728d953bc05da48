/*
 * Utilities
 *
 * Support code that is not part of the scheduling logic itself.
 */

pub mod debug;
