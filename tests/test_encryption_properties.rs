//! Property-based tests for the cipher, key derivation and permission encoding.

use pdf_lock::encryption::algorithms::{derive_object_key, pad_password, PADDING};
use pdf_lock::encryption::rc4::rc4_crypt;
use pdf_lock::encryption::{
    apply_standard_encryption_with_file_id, EncryptionHandler, GraphEncryptor,
};
use pdf_lock::{Document, EncryptionOptions, Object, ObjectRef, Permissions, PrintPermission};
use proptest::prelude::*;

fn print_permission() -> impl Strategy<Value = PrintPermission> {
    prop_oneof![
        Just(PrintPermission::None),
        Just(PrintPermission::LowResolution),
        Just(PrintPermission::HighResolution),
    ]
}

prop_compose! {
    fn permissions()(
        printing in print_permission(),
        modifying in any::<bool>(),
        copying in any::<bool>(),
        annotating in any::<bool>(),
        filling_forms in any::<bool>(),
        content_accessibility in any::<bool>(),
        document_assembly in any::<bool>(),
    ) -> Permissions {
        Permissions {
            printing,
            modifying,
            copying,
            annotating,
            filling_forms,
            content_accessibility,
            document_assembly,
        }
    }
}

fn latin1_password() -> impl Strategy<Value = String> {
    prop::collection::vec(0u8..=255, 0..48)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

proptest! {
    #[test]
    fn rc4_is_its_own_inverse(
        key in prop::collection::vec(any::<u8>(), 1..32),
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let once = rc4_crypt(&key, &data).unwrap();
        prop_assert_eq!(once.len(), data.len());
        prop_assert_eq!(rc4_crypt(&key, &once).unwrap(), data);
    }

    #[test]
    fn permissions_survive_encoding(perms in permissions()) {
        let bits = perms.to_bits();
        prop_assert_eq!(Permissions::from_bits(bits), perms);
        // Reserved bits 7-8 and 13-32 are always set, bits 1-2 always clear
        prop_assert_eq!(bits & 0xFFFFF0C0u32 as i32, 0xFFFFF0C0u32 as i32);
        prop_assert_eq!(bits & 0b11, 0);
        prop_assert!(bits < 0);
    }

    #[test]
    fn padded_password_is_prefix_then_padding(password in latin1_password()) {
        let padded = pad_password(&password).unwrap();
        let bytes: Vec<u8> = password.chars().map(|c| c as u8).collect();
        let used = bytes.len().min(32);

        prop_assert_eq!(&padded[..used], &bytes[..used]);
        prop_assert_eq!(&padded[used..], &PADDING[..32 - used]);
    }

    #[test]
    fn object_keys_are_deterministic(
        key in any::<[u8; 5]>(),
        id in 1u32..0x00FF_FFFF,
        gen in any::<u16>(),
    ) {
        let object = ObjectRef::new(id, gen);
        prop_assert_eq!(derive_object_key(&key, object), derive_object_key(&key, object));
        prop_assert_ne!(
            derive_object_key(&key, object),
            derive_object_key(&key, ObjectRef::new(id + 1, gen))
        );
    }

    #[test]
    fn graph_encryption_round_trips(
        strings in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..8),
        password in latin1_password(),
        perms in permissions(),
    ) {
        let mut doc = Document::new();
        let ids: Vec<ObjectRef> = strings
            .iter()
            .map(|s| doc.register(Object::String(s.clone())).unwrap())
            .collect();

        let options = EncryptionOptions::new(password.clone()).with_permissions(perms);
        apply_standard_encryption_with_file_id(&mut doc, &options, [9u8; 16]).unwrap();

        let mut handler = EncryptionHandler::new(&doc).unwrap();
        prop_assert!(handler.authenticate_user(&password).unwrap());
        prop_assert_eq!(handler.permissions(), perms);

        let key = *handler.file_key().unwrap();
        let decryptor = GraphEncryptor::new(&key);
        for (id, plain) in ids.iter().zip(&strings) {
            let restored = decryptor.crypt_object(*id, doc.lookup(*id).unwrap()).unwrap();
            prop_assert_eq!(restored.as_string(), Some(plain.as_slice()));
        }
    }
}
