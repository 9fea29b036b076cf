use std::path::PathBuf;

fn main() {
    let target = std::env::var("TARGET").unwrap_or_default();
    if !target.starts_with("thumb") {
        return;
    }
    println!("cargo:rerun-if-changed=link.x");
    let script = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap()).join("link.x");
    println!("cargo:rustc-link-arg=-T{}", script.display());
    println!("cargo:rustc-link-arg=-Map=stm32f405.map");
}
