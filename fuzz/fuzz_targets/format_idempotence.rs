#![no_main]

use goast_syntax::{format_tree, kind, parse_file, ParseMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(tree) = parse_file("fuzz.go", src, ParseMode::default()) else {
        return;
    };
    let once = format_tree(&tree).expect("parsed trees print");
    let again = parse_file("fuzz.go", &once, ParseMode::default()).expect("canonical text parses");
    assert_eq!(kind::node_count(&tree), kind::node_count(&again));
    assert_eq!(format_tree(&again).expect("print"), once);
});
