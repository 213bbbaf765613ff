//! Dotenv loading, mirroring `runtime.py`: skipped entirely under
//! `IS_DOCKER=1` (the container already has real env vars injected), and
//! otherwise prefers an `ENV`-suffixed file before falling back to `.env`.

use std::env;

pub fn load_dotenv() {
    if env::var("IS_DOCKER").as_deref() == Ok("1") {
        return;
    }

    let env_label = env::var("ENV").unwrap_or_else(|_| "dev".to_string());
    let scoped = format!(".env.{env_label}");
    if dotenvy::from_filename(&scoped).is_ok() {
        return;
    }
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_flag_short_circuits() {
        env::set_var("IS_DOCKER", "1");
        load_dotenv(); // must not panic even with no .env files present
        env::remove_var("IS_DOCKER");
    }
}
