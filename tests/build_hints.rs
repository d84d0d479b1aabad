//! FFmpeg discovery hints emitted by the build script.

#[allow(dead_code)]
#[path = "../build/ffmpeg_hint.rs"]
mod ffmpeg_hint;

use std::path::{Path, PathBuf};

use ffmpeg_hint::{BuildEnv, Hint, diagnose};

fn windows() -> BuildEnv {
    BuildEnv {
        target_os: "windows".to_string(),
        ..BuildEnv::default()
    }
}

#[test]
fn other_platforms_get_no_hint() {
    let build_env = BuildEnv {
        target_os: "linux".to_string(),
        ..BuildEnv::default()
    };
    assert_eq!(diagnose(&build_env, |_| false), None);
}

#[test]
fn explicit_ffmpeg_dir_silences_hints() {
    let build_env = BuildEnv {
        ffmpeg_dir: Some(PathBuf::from(r"C:\ffmpeg")),
        vcpkg_root: Some(PathBuf::from(r"C:\vcpkg")),
        ..windows()
    };
    assert_eq!(diagnose(&build_env, |_| true), None);
}

#[test]
fn unconfigured_windows_build_is_told_what_to_set() {
    let hint = diagnose(&windows(), |_| true).unwrap();
    assert_eq!(hint, Hint::Unconfigured);
    assert!(hint.to_string().contains("FFMPEG_DIR"));
}

#[test]
fn vcpkg_install_uses_default_triplet() {
    let build_env = BuildEnv {
        vcpkg_root: Some(PathBuf::from("vcpkg")),
        ..windows()
    };
    let expected = Path::new("vcpkg").join("installed").join("x64-windows");

    let hint = diagnose(&build_env, |dir| dir == expected).unwrap();
    assert_eq!(
        hint,
        Hint::VcpkgFound {
            dir: expected,
            dynamic: false
        }
    );
    assert!(hint.to_string().contains("VCPKGRS_DYNAMIC=1"));
}

#[test]
fn missing_triplet_install_is_reported() {
    let build_env = BuildEnv {
        vcpkg_root: Some(PathBuf::from("vcpkg")),
        vcpkg_triplet: Some("x64-windows-static".to_string()),
        vcpkg_dynamic: true,
        ..windows()
    };

    let hint = diagnose(&build_env, |_| false).unwrap();
    assert_eq!(
        hint,
        Hint::VcpkgMissing {
            dir: Path::new("vcpkg").join("installed").join("x64-windows-static")
        }
    );
}
