// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits that define what the system
// talks about: a question, the reply it gets, a notebook, and
// the seams behind which the model lives.
//
// Rules for this layer:
//   - NO candle types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits

// The user's question
pub mod question;

// The three possible reply strings
pub mod reply;

// Notebook metadata cleanup
pub mod notebook;

// Core abstractions (traits) that other layers implement
pub mod traits;
