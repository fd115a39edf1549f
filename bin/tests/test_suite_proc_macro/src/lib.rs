use quote::{format_ident, quote};
use syn::{parse_macro_input, LitStr};

/// Expands to one `#[test]` per `.lox` file below the given directory (relative to `bin/tests`),
/// each calling `lox_expect` with the file's contents.
#[proc_macro]
pub fn generate_tests(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let fixtures_dir = parse_macro_input!(input as LitStr).value();
    let root_dir = format!("{}/../{}", env!("CARGO_MANIFEST_DIR"), fixtures_dir);

    let tests = walkdir::WalkDir::new(&root_dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .map(|entry| {
            let fixture_path = entry.path().to_string_lossy().to_string();
            let relative_path = entry.path().strip_prefix(&root_dir).unwrap().to_string_lossy();
            let test_ident = format_ident!(
                "test_{}",
                relative_path.trim_end_matches(".lox").replace(['/', '-'], "_")
            );
            quote! {
                #[test]
                fn #test_ident() {
                    lox_expect(std::fs::read_to_string(#fixture_path).unwrap().as_str());
                }
            }
        });

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#tests)*
    }
    .into()
}
