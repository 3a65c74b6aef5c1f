#[cfg(test)]
mod tests {
    use data_dictionary::config::Settings;
    use data_dictionary::models::OutputFormat;
    use serial_test::serial;

    fn set_env(key: &str, value: Option<&str>) {
        unsafe {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }

    fn clear_env() {
        set_env("EXPORT_THREADS", None);
        set_env("EXPORT_PREFERRED_FORMATS", None);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.export_threads, None);
        assert_eq!(settings.preferred_formats, vec![OutputFormat::Machine]);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_thread_count() {
        clear_env();
        set_env("EXPORT_THREADS", Some("4"));

        let settings = Settings::from_env();
        assert_eq!(settings.export_threads, Some(4));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_invalid_thread_count() {
        clear_env();
        for raw in ["abc", "-1", "0", ""] {
            set_env("EXPORT_THREADS", Some(raw));
            assert_eq!(Settings::from_env().export_threads, None);
        }
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_parses_format_list() {
        clear_env();
        set_env("EXPORT_PREFERRED_FORMATS", Some("human, machine"));

        let settings = Settings::from_env();
        assert_eq!(
            settings.preferred_formats,
            vec![OutputFormat::Human, OutputFormat::Machine]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_skips_unknown_formats() {
        clear_env();
        set_env("EXPORT_PREFERRED_FORMATS", Some("xml, human"));

        let settings = Settings::from_env();
        assert_eq!(settings.preferred_formats, vec![OutputFormat::Human]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_when_all_formats_unknown() {
        clear_env();
        set_env("EXPORT_PREFERRED_FORMATS", Some("xml"));

        let settings = Settings::from_env();
        assert_eq!(settings.preferred_formats, vec![OutputFormat::Machine]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_unset_uses_defaults() {
        clear_env();
        assert_eq!(Settings::from_env(), Settings::default());
    }
}
