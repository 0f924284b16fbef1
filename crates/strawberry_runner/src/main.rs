use core::str::FromStr;

use runner_core::Variant;
use strum::IntoEnumIterator;

fn main() {
    let variant = match std::env::args().nth(1) {
        Some(name) => {
            let Ok(variant) = Variant::from_str(&name) else {
                let known: Vec<String> = Variant::iter().map(|variant| variant.to_string()).collect();
                eprintln!("unknown variant `{name}`, expected one of: {}", known.join(", "));
                return;
            };
            variant
        }
        None => Variant::default(),
    };

    strawberry_runner::run(variant);
}
