fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = copy_page::browser::install() {
        web_sys::console::error_2(&"[copy-page] install failed:".into(), &err);
    }
}
