//! Database schema definitions.
//!
//! DDL is applied at startup; every statement is idempotent so repeated
//! startups against the same database are safe.

/// PostgreSQL schema for the service.
pub const POSTGRES_SCHEMA: &str = r"
-- Users table. No auth system; rows exist so session/report foreign keys resolve.
CREATE TABLE IF NOT EXISTS users (
    id          BIGSERIAL PRIMARY KEY,
    username    TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Generated drawing topics. Immutable once created.
CREATE TABLE IF NOT EXISTS topics (
    id          BIGSERIAL PRIMARY KEY,
    description TEXT NOT NULL,
    difficulty  TEXT NOT NULL CHECK (difficulty IN ('beginner', 'intermediate', 'advanced')),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Recorded practice sessions.
CREATE TABLE IF NOT EXISTS practice_sessions (
    id                   BIGSERIAL PRIMARY KEY,
    user_id              BIGINT NOT NULL REFERENCES users(id),
    topic_description    TEXT NOT NULL,
    topic_difficulty     TEXT NOT NULL CHECK (topic_difficulty IN ('beginner', 'intermediate', 'advanced')),
    image_path           TEXT NOT NULL,
    duration_seconds     INTEGER NOT NULL CHECK (duration_seconds > 0),
    reflection_good      TEXT,
    reflection_struggled TEXT,
    reflection_learned   TEXT,
    created_at           TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at           TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_practice_sessions_user
    ON practice_sessions (user_id, created_at DESC);

-- At most one report per user; the unique constraint backs the atomic upsert.
CREATE TABLE IF NOT EXISTS ai_reports (
    id                 BIGSERIAL PRIMARY KEY,
    user_id            BIGINT NOT NULL UNIQUE REFERENCES users(id),
    overall_assessment TEXT NOT NULL,
    created_at         TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at         TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

/// Seed for the demo user every request falls back to.
pub const SEED_DEMO_USER: &str = r"
INSERT INTO users (id, username, email)
VALUES (1, 'demo', 'demo@example.com')
ON CONFLICT (id) DO NOTHING;
";
