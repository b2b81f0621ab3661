//! Field extraction from raw bulletin text.
//!
//! Official announcements are written by humans and the time stamp wanders
//! between "18h00 ngày 20/3/2020", "6h ngày 2/4/2020" and "21:30 15/03/2020".
//! Matching them is inherently fuzzy, so it is all kept behind this one
//! interface.

use once_cell::sync::Lazy;
use regex::Regex;

static TIME_STAMP: Lazy<Regex> = Lazy::new(|| Regex::new(
    r"(?x)
    (\d{1,2}) \s* (?:h|:|g|giờ) \s* (\d{2})?   # hour, optional minutes
    [^\d]{0,12}?                               # 'ngày', punctuation
    (\d{1,2}) / (\d{1,2}) / (\d{4})            # day/month/year
    ").expect("the bulletin time stamp pattern must compile"));

/// Fields pulled out of one bulletin text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBulletin {
    /// Normalized to `"HH:MM DD/MM/YYYY"`.
    pub display_time: String,
    pub title: Option<String>,
    pub content: String,
}

/// Finds the first plausible time stamp in the text and returns it together
/// with the cleaned-up body. `None` when no stamp is found: the caller
/// treats that as the source being unavailable this cycle.
pub fn extract_bulletin(text: &str) -> Option<ExtractedBulletin> {
    let content = collapse_whitespace(text);
    if content.is_empty() {
        return None
    }

    let display_time = TIME_STAMP.captures_iter(&content)
        .find_map(|caps| {
            let hour: u32 = caps[1].parse().ok()?;
            let minute: u32 = caps.get(2).map(|m| m.as_str().parse().ok()).unwrap_or(Some(0))?;
            let day: u32 = caps[3].parse().ok()?;
            let month: u32 = caps[4].parse().ok()?;
            let year: u32 = caps[5].parse().ok()?;
            if hour > 23 || minute > 59 || day == 0 || day > 31 || month == 0 || month > 12 {
                return None
            }
            Some(format!("{hour:02}:{minute:02} {day:02}/{month:02}/{year}"))
        })?;

    let title = content.split(['.', ':'])
        .map(str::trim)
        .find(|part| !part.is_empty())
        .map(str::to_owned);

    Some(ExtractedBulletin { display_time, title, content })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod test {
    use super::extract_bulletin;

    #[test]
    fn moh_style_stamp() {
        let text = "BẢN TIN VỀ DỊCH COVID-19: Bản tin lúc 18h00 ngày 20/3/2020 \
                    của Ban Chỉ đạo Quốc gia. Ghi nhận thêm 9 ca mắc mới.";
        let bulletin = extract_bulletin(text).unwrap();
        assert_eq!(bulletin.display_time, "18:00 20/03/2020");
        assert!(bulletin.content.contains("9 ca mắc mới"));
    }

    #[test]
    fn hour_without_minutes() {
        let text = "Cập nhật lúc 6h ngày 2/4/2020: thêm 3 trường hợp dương tính.";
        let bulletin = extract_bulletin(text).unwrap();
        assert_eq!(bulletin.display_time, "06:00 02/04/2020");
    }

    #[test]
    fn colon_separated_stamp() {
        let text = "Tính đến 21:30 ngày 15/03/2020, Việt Nam ghi nhận 57 ca.";
        let bulletin = extract_bulletin(text).unwrap();
        assert_eq!(bulletin.display_time, "21:30 15/03/2020");
    }

    #[test]
    fn gio_spelled_out() {
        let text = "Thông báo 7 giờ 30 ngày 01/04/2020 về các ca bệnh.";
        let bulletin = extract_bulletin(text).unwrap();
        assert_eq!(bulletin.display_time, "07:30 01/04/2020");
    }

    #[test]
    fn implausible_stamp_is_skipped_for_a_later_one() {
        let text = "Mã hồ sơ 99h99 ngày 99/99/2020. Bản tin lúc 18h00 ngày 20/3/2020.";
        let bulletin = extract_bulletin(text).unwrap();
        assert_eq!(bulletin.display_time, "18:00 20/03/2020");
    }

    #[test]
    fn no_stamp_means_no_bulletin() {
        assert!(extract_bulletin("Không có gì mới hôm nay.").is_none());
        assert!(extract_bulletin("").is_none());
        assert!(extract_bulletin("   \n\t ").is_none());
    }

    #[test]
    fn whitespace_is_collapsed_into_one_line() {
        let text = "Bản tin   lúc 18h00\n\nngày 20/3/2020.\nThêm 2 ca.";
        let bulletin = extract_bulletin(text).unwrap();
        assert_eq!(bulletin.content, "Bản tin lúc 18h00 ngày 20/3/2020. Thêm 2 ca.");
    }

    #[test]
    fn title_is_the_leading_clause() {
        let text = "Bản tin dịch COVID-19: cập nhật lúc 18h00 ngày 20/3/2020.";
        let bulletin = extract_bulletin(text).unwrap();
        assert_eq!(bulletin.title.as_deref(), Some("Bản tin dịch COVID-19"));
    }
}
