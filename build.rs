fn main() {
    // Resource compilation only makes sense for Windows targets.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    let mut res = winres::WindowsResource::new();
    res.set("ProductName", "DNS Switcher")
        .set("FileDescription", "Switch the system DNS resolver to a public provider")
        .set("OriginalFilename", "dns-switcher.exe");

    if let Err(e) = res.compile() {
        println!("cargo:warning=failed to embed Windows resources: {e}");
    }
}
