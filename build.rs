// build.rs: target detection for the native block engine.
//
// Emits `cargo:rustc-cfg=native_engine` on 64-bit little-endian targets with
// cheap unaligned loads (x86_64, aarch64).  The native engine reads input as
// little-endian words through unaligned pointers and is only bound by the
// engine selector when this cfg is set; every other target uses the software
// engine.
fn main() {
    println!("cargo:rustc-check-cfg=cfg(native_engine)");
    println!("cargo:rerun-if-changed=build.rs");

    let target_arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let target_endian = std::env::var("CARGO_CFG_TARGET_ENDIAN").unwrap_or_default();
    let pointer_width = std::env::var("CARGO_CFG_TARGET_POINTER_WIDTH").unwrap_or_default();

    let native_archs = ["x86_64", "aarch64"];
    if native_archs.contains(&target_arch.as_str())
        && target_endian == "little"
        && pointer_width == "64"
    {
        println!("cargo:rustc-cfg=native_engine");
    }
}
