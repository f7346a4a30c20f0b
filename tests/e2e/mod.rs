// End-to-end tests for the Podcast Backend API
//
// HTTP tests start the real axum router on an ephemeral port. Records live in
// the in-memory store, audio is written to a per-test temporary directory and
// both AI providers are scripted fakes.
//
// The Postgres record store is tested against a shared PostgreSQL container
// (testcontainers); each test gets its own freshly migrated database.

mod test_podcasts;
