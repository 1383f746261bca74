//! Rendering listed roles for the terminal

use std::io::{self, Write};

use clap::ValueEnum;
use cr_common::Role;
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One role per line: name, path, creation date, ARN
    Text,
    /// JSON array using IAM's key names
    Json,
}

#[derive(Tabled)]
#[tabled(rename_all = "SCREAMING_SNAKE_CASE")]
struct RoleRow {
    name: String,
    path: String,
    created: String,
    arn: String,
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        Self {
            name: role.role_name.clone(),
            path: role.path.clone(),
            created: role.create_date.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            arn: role.arn.clone(),
        }
    }
}

pub fn write_roles<W: Write>(out: &mut W, roles: &[Role], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, roles)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            let table = tabled::Table::new(roles.iter().map(RoleRow::from))
                .with(tabled::settings::Style::empty())
                .with(tabled::settings::Padding::new(0, 1, 0, 0))
                .to_string();
            writeln!(out, "{}", table)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_roles() -> Vec<Role> {
        let created = Utc.with_ymd_and_hms(2024, 5, 20, 7, 0, 0).unwrap();
        let mut exec = Role::new(
            "lambda-exec",
            "AROA1",
            "arn:aws:iam::123456789012:role/service-role/lambda-exec",
            created,
        );
        exec.path = "/service-role/".to_string();
        vec![
            Role::new("ci", "AROA2", "arn:aws:iam::123456789012:role/ci", created),
            exec,
        ]
    }

    fn render(roles: &[Role]) -> String {
        let mut buf = Vec::new();
        write_roles(&mut buf, roles, OutputFormat::Text).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_output_aligns_columns() {
        let text = render(&sample_roles());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);

        let header = lines[0];
        assert!(header.starts_with("NAME "));
        let path_col = header.find("PATH").unwrap();
        let created_col = header.find("CREATED").unwrap();
        let arn_col = header.find("ARN").unwrap();
        assert!(path_col < created_col && created_col < arn_col);

        assert!(lines[1].starts_with("ci "));
        assert_eq!(lines[1].find('/'), Some(path_col));
        assert_eq!(lines[1].find("arn:"), Some(arn_col));

        assert!(lines[2].starts_with("lambda-exec "));
        assert_eq!(lines[2].find("/service-role/"), Some(path_col));
        assert_eq!(lines[2].find("2024-05-20T07:00:00Z"), Some(created_col));
        assert!(lines[2].trim_end().ends_with("role/service-role/lambda-exec"));
    }

    #[test]
    fn test_json_output_keeps_order() {
        let mut buf = Vec::new();
        write_roles(&mut buf, &sample_roles(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value[0]["RoleName"], "ci");
        assert_eq!(value[1]["RoleName"], "lambda-exec");
        assert_eq!(value[1]["Path"], "/service-role/");
    }

    #[test]
    fn test_text_output_empty_has_header_only() {
        let text = render(&[]);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 1);
        let header: Vec<_> = lines[0].split_whitespace().collect();
        assert_eq!(header, ["NAME", "PATH", "CREATED", "ARN"]);
    }
}
