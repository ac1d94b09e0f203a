/// Remote path of `name` inside `dir`: `<dir>/<name>`, with `dir` taken as
/// written in the config.
pub fn remote_join(dir: &str, name: &str) -> String {
    format!("{dir}/{name}")
}

#[cfg(test)]
mod tests {
    use super::remote_join;

    #[test]
    fn dir_and_name_are_joined_verbatim() {
        assert_eq!(remote_join("/export/old", "a.csv"), "/export/old/a.csv");
        assert_eq!(remote_join("old", "a.csv"), "old/a.csv");
        assert_eq!(remote_join(r"csv\old", "a.csv"), r"csv\old/a.csv");
    }

    #[test]
    fn empty_dir_points_at_server_root() {
        assert_eq!(remote_join("", "a.csv"), "/a.csv");
        assert_ne!(remote_join("", "a.csv"), "a.csv");
    }
}
