use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=cpp/zed_interface.h");
    println!("cargo:rerun-if-changed=cpp/zed_interface.cpp");
    println!("cargo:rerun-if-env-changed=ZED_SDK_ROOT");
    println!("cargo:rerun-if-env-changed=CUDA_HOME");

    // Without the camera feature the crate builds against stub bindings and
    // needs neither the SDK nor CUDA.
    if env::var_os("CARGO_FEATURE_ZED_CAMERA").is_none() {
        return;
    }

    let zed_root = PathBuf::from(env::var("ZED_SDK_ROOT").unwrap_or("/usr/local/zed".to_owned()));
    let cuda_root = PathBuf::from(env::var("CUDA_HOME").unwrap_or("/usr/local/cuda".to_owned()));

    cc::Build::new()
        .cpp(true)
        .std("c++17")
        .file("cpp/zed_interface.cpp")
        .include("cpp")
        .include(zed_root.join("include"))
        .include(cuda_root.join("include"))
        .compile("zed_interface");

    println!("cargo:rustc-link-search=native={}", zed_root.join("lib").display());
    println!("cargo:rustc-link-search=native={}", cuda_root.join("lib64").display());
    println!("cargo:rustc-link-lib=dylib=sl_zed");
    println!("cargo:rustc-link-lib=dylib=cudart");
}
