#[path = "build/ffmpeg_hint.rs"]
mod ffmpeg_hint;

use ffmpeg_hint::{BuildEnv, WATCHED_VARS, diagnose};

fn main() {
    for var in WATCHED_VARS {
        println!("cargo:rerun-if-env-changed={var}");
    }
    println!("cargo:rerun-if-changed=build/ffmpeg_hint.rs");

    if let Some(hint) = diagnose(&BuildEnv::from_env(), |dir| dir.is_dir()) {
        println!("cargo:warning={hint}");
    }
}
