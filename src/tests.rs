#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::services::slug::{
            generate_slug, suffixed_slug, validate_slug, validate_slug_input,
        };

        #[test]
        fn test_generate_slug_basic() {
            assert_eq!(generate_slug("Test Name", 50), "test-name");
        }

        #[test]
        fn test_generate_slug_special_characters() {
            assert_eq!(generate_slug("Hello, World!", 50), "hello-world");
        }

        #[test]
        fn test_generate_slug_unicode() {
            assert_eq!(generate_slug("Café au lait", 50), "cafe-au-lait");
            assert_eq!(generate_slug("Zürich Grundbuch", 50), "zurich-grundbuch");
        }

        #[test]
        fn test_generate_slug_is_deterministic() {
            let name = "Ñandú Cooperative — São Paulo";
            assert_eq!(generate_slug(name, 50), generate_slug(name, 50));
        }

        #[test]
        fn test_generate_slug_multiple_spaces() {
            assert_eq!(generate_slug("  Hello   World  ", 50), "hello-world");
        }

        #[test]
        fn test_generate_slug_truncates_to_max_length() {
            let slug = generate_slug(
                "Very Long Name For The Purposes of Testing That Slug Truncation Functions Correctly",
                50,
            );
            assert_eq!(slug.len(), 50);
            assert_eq!(slug, "very-long-name-for-the-purposes-of-testing-that-sl");
        }

        #[test]
        fn test_generate_slug_drops_hyphen_left_by_truncation() {
            assert_eq!(generate_slug("abc def", 4), "abc");
        }

        #[test]
        fn test_generate_slug_cut_on_hyphen_is_one_short() {
            let name = format!("{} bbbbbbbb", "a".repeat(49));
            let slug = generate_slug(&name, 50);
            assert_eq!(slug.len(), 49);
            assert_eq!(slug, "a".repeat(49));
        }

        #[test]
        fn test_generate_slug_empty_name_falls_back() {
            assert_eq!(generate_slug("", 50), "untitled");
            assert_eq!(generate_slug("!!! ///", 50), "untitled");
        }

        #[test]
        fn test_generate_slug_shape() {
            let names = [
                "Test Name",
                "--leading and trailing--",
                "Ünïcödé Nämé",
                "a/b\\c;d<e>f",
                "UPPER lower 123",
            ];
            for name in names {
                let slug = generate_slug(name, 50);
                assert!(validate_slug(&slug, 50), "bad slug {:?} for {:?}", slug, name);
                assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            }
        }

        #[test]
        fn test_suffixed_slug_short_base() {
            assert_eq!(suffixed_slug("test-name", 1, 50), "test-name-1");
            assert_eq!(suffixed_slug("test-name", 100, 50), "test-name-100");
        }

        #[test]
        fn test_suffixed_slug_fits_at_powers_of_ten() {
            let base = "a".repeat(50);
            for x in [1u32, 9, 10, 99, 100, 999, 1000, 12345] {
                let slug = suffixed_slug(&base, x, 50);
                assert_eq!(slug.len(), 50, "suffix {}", x);
                assert!(slug.ends_with(&format!("-{}", x)));
            }
        }

        #[test]
        fn test_suffixed_slug_avoids_double_hyphen() {
            let base = "very-long-name-for-the-purposes-of-testing-that-sl";
            assert_eq!(
                suffixed_slug(base, 1, 50),
                "very-long-name-for-the-purposes-of-testing-that-1"
            );
        }

        #[test]
        fn test_suffixed_slug_drops_hyphen_at_cut() {
            let base = "very-long-name-for-the-purposes-of-testing-that-sl";
            let slug_length = 50 - 1u32.ilog10() as usize - 2;
            let cut = &base[..slug_length];
            assert!(cut.ends_with('-'));

            let slug = suffixed_slug(base, 1, 50);
            assert_eq!(slug, format!("{}-1", cut.trim_end_matches('-')));
            assert_eq!(slug.len(), 49);
            assert!(!slug.contains("--"));
        }

        #[test]
        fn test_validate_slug_input() {
            assert!(validate_slug_input("my_slug", 50));
            assert!(validate_slug_input("My-Slug", 50));
            assert!(validate_slug_input("hello-world-2", 50));
            assert!(!validate_slug_input("", 50));
            assert!(!validate_slug_input("not a slug", 50));
            assert!(!validate_slug_input("café", 50));
            assert!(!validate_slug_input(&"a".repeat(51), 50));
        }

        #[test]
        fn test_validate_slug() {
            assert!(validate_slug("hello-world", 50));
            assert!(validate_slug("123", 50));
            assert!(!validate_slug("", 50));
            assert!(!validate_slug("Hello-World", 50));
            assert!(!validate_slug("hello_world", 50));
            assert!(!validate_slug(&"a".repeat(51), 50));
            assert!(validate_slug(&"a".repeat(50), 50));
        }
    }

    mod random_id_tests {
        use crate::services::random_id::{generate_random_id, ID_ALPHABET, ID_FIELD_LENGTH};
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        #[test]
        fn test_generate_random_id_length_and_charset() {
            let id = generate_random_id(&mut rand::thread_rng(), ID_FIELD_LENGTH);
            assert_eq!(id.len(), ID_FIELD_LENGTH);
            assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        }

        #[test]
        fn test_generate_random_id_seeded_is_repeatable() {
            let a = generate_random_id(&mut StdRng::seed_from_u64(10), 24);
            let b = generate_random_id(&mut StdRng::seed_from_u64(10), 24);
            assert_eq!(a, b);
        }

        #[test]
        fn test_alphabet_has_no_lookalikes() {
            for c in [b'l', b'o', b'0', b'1'] {
                assert!(!ID_ALPHABET.contains(&c));
            }
        }
    }

    mod sanitize_tests {
        use crate::models::{Field, Record, Value};
        use crate::services::sanitize::{
            clean_fields, sanitize_string, validate_structure, DENYLIST_MESSAGE,
        };
        use crate::Error;

        struct Parcel {
            id: String,
            slug: String,
            name: Value,
            notes: Value,
            number: Value,
        }

        impl Parcel {
            fn new(name: &str, number: Value) -> Self {
                Self {
                    id: String::new(),
                    slug: String::new(),
                    name: name.into(),
                    notes: Value::Null,
                    number,
                }
            }
        }

        impl Record for Parcel {
            const TABLE: &'static str = "parcels";
            const FIELDS: &'static [Field] = &[
                Field::char("id", 24).blank(),
                Field::slug("slug", 50).blank(),
                Field::char("name", 100),
                Field::text("notes").blank().null(),
                Field::integer("number"),
            ];

            fn value(&self, field: &str) -> Value {
                match field {
                    "id" => self.id.as_str().into(),
                    "slug" => self.slug.as_str().into(),
                    "name" => self.name.clone(),
                    "notes" => self.notes.clone(),
                    "number" => self.number.clone(),
                    _ => Value::Null,
                }
            }
        }

        fn validation_errors(result: crate::Result<()>) -> crate::ValidationErrors {
            match result {
                Err(Error::Validation(errors)) => errors,
                other => panic!("expected validation error, got {:?}", other),
            }
        }

        #[test]
        fn test_sanitize_string() {
            assert!(sanitize_string("plain text, with: punctuation!"));
            for bad in ["<", ">", ";", "\\", "/"] {
                assert!(!sanitize_string(&format!("a{}b", bad)), "{}", bad);
            }
        }

        #[test]
        fn test_valid_record() {
            let parcel = Parcel::new("blah", Value::Integer(2));
            assert!(clean_fields(&parcel, &[]).is_ok());
        }

        #[test]
        fn test_invalid_name() {
            let parcel = Parcel::new("<blah>", Value::Integer(2));
            let errors = validation_errors(clean_fields(&parcel, &[]));
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get("name"), Some(&[DENYLIST_MESSAGE.to_string()][..]));
        }

        #[test]
        fn test_invalid_number_only_structural_error() {
            let parcel = Parcel::new("blah", Value::from("blubb"));
            let errors = validation_errors(clean_fields(&parcel, &[]));
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["number"]);
            let messages = errors.get("number").unwrap();
            assert_eq!(messages, ["'blubb' value must be an integer."]);
        }

        #[test]
        fn test_numeric_text_is_an_integer() {
            let parcel = Parcel::new("blah", Value::from("42"));
            assert!(clean_fields(&parcel, &[]).is_ok());
        }

        #[test]
        fn test_invalid_name_and_number() {
            let parcel = Parcel::new("<blah>", Value::from("blubb"));
            let errors = validation_errors(clean_fields(&parcel, &[]));
            assert_eq!(errors.len(), 2);
            assert!(errors.get("name").unwrap().contains(&DENYLIST_MESSAGE.to_string()));
            assert!(!errors.get("number").unwrap().is_empty());
        }

        #[test]
        fn test_structural_and_denylist_errors_accumulate() {
            let long_bad = format!("{}/", "x".repeat(100));
            let parcel = Parcel::new(&long_bad, Value::Integer(1));
            let errors = validation_errors(clean_fields(&parcel, &[]));
            let messages = errors.get("name").unwrap();
            assert_eq!(messages.len(), 2);
            assert!(messages[0].starts_with("Ensure this value has at most 100 characters"));
            assert_eq!(messages[1], DENYLIST_MESSAGE);
        }

        #[test]
        fn test_id_and_slug_are_not_sanitized() {
            let mut parcel = Parcel::new("blah", Value::Integer(2));
            parcel.id = "a/b".to_string();
            let errors = validate_structure(&parcel, &[]);
            assert!(errors.is_empty());
            assert!(clean_fields(&parcel, &[]).is_ok());
        }

        #[test]
        fn test_slug_field_is_structurally_checked() {
            let mut parcel = Parcel::new("blah", Value::Integer(2));
            parcel.slug = "Not A Slug".to_string();
            let errors = validation_errors(clean_fields(&parcel, &[]));
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["slug"]);
        }

        #[test]
        fn test_slug_field_accepts_underscores_and_capitals() {
            for slug in ["my_slug", "My-Slug"] {
                let mut parcel = Parcel::new("blah", Value::Integer(2));
                parcel.slug = slug.to_string();
                assert!(clean_fields(&parcel, &[]).is_ok(), "{}", slug);
            }
        }

        #[test]
        fn test_excluded_fields_are_skipped() {
            let parcel = Parcel::new("<blah>", Value::from("blubb"));
            assert!(clean_fields(&parcel, &["name", "number"]).is_ok());
        }

        #[test]
        fn test_text_field_checked_and_null_allowed() {
            let mut parcel = Parcel::new("blah", Value::Integer(2));
            assert!(clean_fields(&parcel, &[]).is_ok());

            parcel.notes = Value::from("see ../other; file");
            let errors = validation_errors(clean_fields(&parcel, &[]));
            assert!(errors.contains("notes"));
        }

        #[test]
        fn test_blank_and_null_rejected_where_not_allowed() {
            let parcel = Parcel::new("", Value::Null);
            let errors = validation_errors(clean_fields(&parcel, &[]));
            assert_eq!(errors.get("name").unwrap(), ["This field cannot be blank."]);
            assert_eq!(errors.get("number").unwrap(), ["This field cannot be null."]);
        }

        #[test]
        fn test_validation_errors_display() {
            let parcel = Parcel::new("<blah>", Value::from("blubb"));
            let errors = validation_errors(clean_fields(&parcel, &[]));
            assert_eq!(
                errors.to_string(),
                format!(
                    "name: {}; number: 'blubb' value must be an integer.",
                    DENYLIST_MESSAGE
                )
            );
        }
    }

    mod error_tests {
        use crate::Error;
        use rusqlite::Connection;

        #[test]
        fn test_unique_failure_maps_to_constraint_violation() {
            let conn = Connection::open_in_memory().unwrap();
            conn.execute_batch("CREATE TABLE t (slug TEXT UNIQUE); INSERT INTO t VALUES ('a');")
                .unwrap();
            let err: Error = conn
                .execute("INSERT INTO t VALUES ('a')", [])
                .unwrap_err()
                .into();
            assert!(matches!(err, Error::ConstraintViolation(_)), "{:?}", err);
        }

        #[test]
        fn test_other_failures_stay_database_errors() {
            let conn = Connection::open_in_memory().unwrap();
            let err: Error = conn
                .execute("INSERT INTO missing VALUES (1)", [])
                .unwrap_err()
                .into();
            assert!(matches!(err, Error::Database(_)));
        }
    }

    mod config_tests {
        use crate::config::Config;
        use crate::services::random_id::IdPolicy;

        #[test]
        fn test_defaults_when_sections_missing() {
            let config: Config = toml::from_str("").unwrap();
            assert_eq!(config.database.pool_size, 10);
            assert_eq!(config.ids.length, 24);
            assert_eq!(config.ids.max_attempts, 1000);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_parse_and_policy() {
            let config: Config = toml::from_str(
                r#"
                [database]
                path = "/tmp/hooks.db"

                [ids]
                length = 16
                max_attempts = 0
                "#,
            )
            .unwrap();
            assert_eq!(config.database.path, "/tmp/hooks.db");
            let policy = IdPolicy::from(&config.ids);
            assert_eq!(policy.length, 16);
            assert_eq!(policy.max_attempts, None);
        }

        #[test]
        fn test_validate_rejects_bad_values() {
            let mut config = Config::default();
            config.ids.length = 4;
            assert!(config.validate().is_err());

            let mut config = Config::default();
            config.ids.length = 64;
            assert!(config.validate().is_err());

            let mut config = Config::default();
            config.database.pool_size = 0;
            assert!(config.validate().is_err());
        }
    }
}
