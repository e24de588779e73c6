//! Stamps the binary with the date it was built.

fn main() {
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=MANGOVIEW_BUILD_DATE={}", build_date);
    println!("cargo:rerun-if-changed=build.rs");
}
