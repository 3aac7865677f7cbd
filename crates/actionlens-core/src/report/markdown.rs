use super::Report;

pub const TITLE: &str = "# 🚀 Workflow Analysis Report";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a report as a markdown document.
pub fn render(report: &Report) -> String {
    let mut md = String::new();

    md.push_str(TITLE);
    md.push('\n');
    md.push_str(&format!(
        "Generated on: {}\n\n",
        report.generated_at.format(TIMESTAMP_FORMAT)
    ));

    for section in &report.sections {
        md.push_str(section.kind.heading());
        md.push('\n');
        if section.kind.blank_line_after_heading() {
            md.push('\n');
        }
        md.push_str(&section.body);
        md.push_str("\n\n");
    }

    md.truncate(md.trim_end().len());
    md.push('\n');
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Section, SectionKind};
    use chrono::NaiveDate;

    fn report(sections: Vec<Section>) -> Report {
        Report {
            generated_at: NaiveDate::from_ymd_opt(2026, 1, 2)
                .and_then(|d| d.and_hms_opt(3, 4, 5))
                .unwrap(),
            sections,
        }
    }

    #[test]
    fn test_header_and_timestamp() {
        let md = render(&report(Vec::new()));
        assert_eq!(md, "# 🚀 Workflow Analysis Report\nGenerated on: 2026-01-02 03:04:05\n");
    }

    #[test]
    fn test_body_follows_heading_directly() {
        let md = render(&report(vec![
            Section {
                kind: SectionKind::Query,
                body: "```\nbuild it\n```".into(),
            },
            Section {
                kind: SectionKind::References,
                body: "- [a](b)".into(),
            },
        ]));
        assert_eq!(
            md,
            "# 🚀 Workflow Analysis Report\nGenerated on: 2026-01-02 03:04:05\n\n\
             ## 📝 Query\n```\nbuild it\n```\n\n\
             ## 📚 References\n- [a](b)\n"
        );
    }

    #[test]
    fn test_sub_headed_sections_keep_a_blank_line() {
        let md = render(&report(vec![
            Section {
                kind: SectionKind::BuildQuality,
                body: "### Quality Gates\n- ✅ Linting".into(),
            },
            Section {
                kind: SectionKind::Security,
                body: "### Critical Issues\n✅ No critical issues found".into(),
            },
        ]));
        assert!(md.contains("## 🏗️ Build Quality Analysis\n\n### Quality Gates\n"));
        assert!(md.contains("## 🔒 Security Analysis\n### Critical Issues\n"));
    }
}
