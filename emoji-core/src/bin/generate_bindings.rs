//! Generate UniFFI Swift bindings for the emoji picker core
//!
//! Run: cargo run --bin generate-bindings
//!
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │ DEPENDENCY MAP - Output paths must match the host package layout            │
//! │                                                                             │
//! │ Inputs:                                                                     │
//! │   target/release/libemoji_core.dylib   ← Built library for bindgen          │
//! │                                                                             │
//! │ Outputs:                                                                    │
//! │   Sources/EmojiCoreFFI/emoji_coreFFI.h      ← C header                      │
//! │   Sources/EmojiCoreFFI/module.modulemap     ← Clang module map              │
//! │   Sources/EmojiCoreFFI/libemoji_core.a      ← Universal iOS static lib      │
//! │   Sources/EmojiCore/emoji_core.swift        ← Swift bindings                │
//! └─────────────────────────────────────────────────────────────────────────────┘

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const LIB_NAME: &str = "emoji_core";
const FFI_MODULE: &str = "EmojiCoreFFI";

fn main() {
    let rust_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let project_root = rust_dir.parent().expect("No parent directory");

    // Match the deployment target of the host app
    env::set_var("IPHONEOS_DEPLOYMENT_TARGET", "15.0");

    println!("Building Rust library...");
    run_cmd("cargo", &["build", "--release"], &rust_dir);

    println!("Generating Swift bindings...");
    let library = format!("target/release/lib{LIB_NAME}.dylib");
    run_cmd(
        "cargo",
        &[
            "run",
            "--bin",
            "uniffi-bindgen",
            "generate",
            "--library",
            &library,
            "--language",
            "swift",
            "--out-dir",
            "generated",
        ],
        &rust_dir,
    );

    let ffi_dest = project_root.join("Sources").join(FFI_MODULE);
    let swift_dest = project_root.join("Sources/EmojiCore");
    let generated = rust_dir.join("generated");
    fs::create_dir_all(&ffi_dest).expect("Create FFI dir");
    fs::create_dir_all(&swift_dest).expect("Create Swift dir");

    // Fix Swift 6 concurrency + module import
    println!("Copying generated Swift file...");
    let swift_file = format!("{LIB_NAME}.swift");
    let mut swift_content =
        fs::read_to_string(generated.join(&swift_file)).expect("Read swift file");
    swift_content = swift_content.replace(
        "private var initializationResult",
        "nonisolated(unsafe) private var initializationResult",
    );
    swift_content = swift_content.replace(
        &format!("#if canImport({LIB_NAME}FFI)"),
        &format!("#if canImport({FFI_MODULE})"),
    );
    swift_content = swift_content.replace(
        &format!("import {LIB_NAME}FFI"),
        &format!("import {FFI_MODULE}"),
    );
    fs::write(swift_dest.join(&swift_file), swift_content).expect("Write swift");

    let header = format!("{LIB_NAME}FFI.h");
    fs::copy(generated.join(&header), ffi_dest.join(&header)).expect("Copy header");

    println!("Writing modulemap...");
    fs::write(
        ffi_dest.join("module.modulemap"),
        format!("module {FFI_MODULE} {{\n    header \"{header}\"\n    export *\n}}\n"),
    )
    .expect("Write modulemap");

    // Device + simulator slices; the simulator build is universal
    println!("Building iOS static libraries...");
    for target in ["aarch64-apple-ios", "aarch64-apple-ios-sim", "x86_64-apple-ios"] {
        run_cmd("cargo", &["build", "--release", "--target", target], &rust_dir);
    }

    let static_lib = format!("lib{LIB_NAME}.a");
    let sim_lib = rust_dir.join("target/ios-sim").join(&static_lib);
    fs::create_dir_all(rust_dir.join("target/ios-sim")).expect("Create sim dir");
    run_cmd(
        "lipo",
        &[
            "-create",
            &format!("target/aarch64-apple-ios-sim/release/{static_lib}"),
            &format!("target/x86_64-apple-ios/release/{static_lib}"),
            "-output",
            &sim_lib.to_string_lossy(),
        ],
        &rust_dir,
    );
    fs::copy(
        rust_dir.join(format!("target/aarch64-apple-ios/release/{static_lib}")),
        ffi_dest.join(&static_lib),
    )
    .expect("Copy device lib");

    println!("Done! Bindings regenerated successfully.");
    println!("Generated files:");
    println!("  - {}/{} (UniFFI generated)", swift_dest.display(), swift_file);
    println!("  - {}/{}", ffi_dest.display(), header);
    println!("  - {}/module.modulemap", ffi_dest.display());
    println!("  - {}/{} (device)", ffi_dest.display(), static_lib);
    println!("  - {} (simulator)", sim_lib.display());
}

fn run_cmd(program: &str, args: &[&str], dir: &Path) {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap_or_else(|e| panic!("Failed to run {}: {}", program, e));

    if !status.success() {
        panic!("{} failed with status: {}", program, status);
    }
}
