use afl::fuzz;

fn main() {
    fuzz!(|data: &[u8]| {
        if let Ok(input) = std::str::from_utf8(data) {
            if let Ok(tokens) = progtest::lex(input) {
                if let Ok(document) = progtest::Parser::parse(&tokens, "fuzz") {
                    // Binding must not panic on any parsed document
                    let host = progtest::PackageCache::default();
                    let _ = progtest::bind(&document, &host);
                }
            }
        }
    });
}
