//! Provider hosts, request bounds, and lookup tables.

/// Production API host.
pub const PRODUCTION_HOST: &str = "https://api.xmpush.xiaomi.com";

/// Host serving the invalid registration id feedback endpoint.
pub const FEEDBACK_HOST: &str = "https://feedback.xmpush.xiaomi.com";

/// Maximum recipients in one registration id, alias, or account list.
pub const MAX_TARGETS: usize = 1000;

/// Maximum topics combined by one multi-topic broadcast.
pub const MAX_TOPICS: usize = 5;

/// Minimum topics for a multi-topic broadcast; one topic is a plain broadcast.
pub const MIN_MULTI_TOPICS: usize = 2;

/// Separator between topics in the `topics` field.
pub const TOPIC_SEPARATOR: &str = ";$;";

/// Default number of attempts (1 initial + 2 retries) per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Handset brand display names mapped to the provider's model codes.
///
/// Used to fill `extra.model` style filters.
pub const BRANDS: &[(&str, &str)] = &[
    ("品牌", "MODEL"),
    ("小米", "xiaomi"),
    ("三星", "samsung"),
    ("华为", "huawei"),
    ("中兴", "zte"),
    ("中兴努比亚", "nubia"),
    ("酷派", "coolpad"),
    ("联想", "lenovo"),
    ("魅族", "meizu"),
    ("HTC", "htc"),
    ("OPPO", "oppo"),
    ("VIVO", "vivo"),
    ("摩托罗拉", "motorola"),
    ("索尼", "sony"),
    ("LG", "lg"),
    ("金立", "jinli"),
    ("天语", "tianyu"),
    ("诺基亚", "nokia"),
    ("美图秀秀", "meitu"),
    ("谷歌", "google"),
    ("TCL", "tcl"),
    ("锤子手机", "chuizi"),
    ("一加手机", "1+"),
    ("中国移动", "chinamobile"),
    ("昂达", "angda"),
    ("邦华", "banghua"),
    ("波导", "bird"),
    ("长虹", "changhong"),
    ("大可乐", "dakele"),
    ("朵唯", "doov"),
    ("海尔", "haier"),
    ("海信", "hisense"),
    ("康佳", "konka"),
    ("酷比魔方", "kubimofang"),
    ("米歌", "mige"),
    ("欧博信", "ouboxin"),
    ("欧新", "ouxin"),
    ("飞利浦", "philip"),
    ("维图", "voto"),
    ("小辣椒", "xiaolajiao"),
    ("夏新", "xiaxin"),
    ("亿通", "yitong"),
    ("语信", "yuxin"),
];

/// Handset price buckets accepted by the provider.
pub const PRICE_RANGES: &[&str] = &["0-999", "1000-1999", "2000-3999", "4000+"];

/// Look up the provider model code for a brand display name.
pub fn brand_code(name: &str) -> Option<&'static str> {
    BRANDS
        .iter()
        .find(|(display, _)| *display == name)
        .map(|(_, code)| *code)
}

/// Return the canonical price bucket if `range` is one the provider accepts.
pub fn price_range(range: &str) -> Option<&'static str> {
    PRICE_RANGES.iter().copied().find(|r| *r == range)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_code_known() {
        assert_eq!(brand_code("小米"), Some("xiaomi"));
        assert_eq!(brand_code("OPPO"), Some("oppo"));
        assert_eq!(brand_code("一加手机"), Some("1+"));
    }

    #[test]
    fn brand_code_unknown() {
        assert_eq!(brand_code("nope"), None);
        assert_eq!(brand_code(""), None);
    }

    #[test]
    fn brand_codes_are_unique() {
        let mut codes: Vec<_> = BRANDS.iter().map(|(_, c)| *c).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len());
    }

    #[test]
    fn price_range_lookup() {
        assert_eq!(price_range("4000+"), Some("4000+"));
        assert_eq!(price_range("1000-1999"), Some("1000-1999"));
        assert_eq!(price_range("5000+"), None);
    }

    #[test]
    fn topic_bounds_consistent() {
        assert!(MIN_MULTI_TOPICS <= MAX_TOPICS);
        assert_eq!(DEFAULT_MAX_ATTEMPTS, 3);
    }
}
