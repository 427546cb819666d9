#![no_main]

use libfuzzer_sys::fuzz_target;
use strongbox::core::operations::key_factory;
use strongbox::core::types::{SignatureSecret, SymmetricEncryption};
use strongbox::HiddenString;

fuzz_target!(|data: &[u8]| {
    let exported = HiddenString::from(data);
    let _ = key_factory::import::<SymmetricEncryption>(&exported);
    let _ = key_factory::import::<SignatureSecret>(&exported);
});
