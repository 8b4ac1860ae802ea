use url::form_urlencoded;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Encode fields as a UTF-8 `application/x-www-form-urlencoded` body, keeping their order.
pub fn encode_form_body(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn keeps_field_order_and_empty_values() {
        let body = encode_form_body(&pairs(&[("message", "hi"), ("extension", ""), ("flash", "")]));
        assert_eq!(body, "message=hi&extension=&flash=");
    }

    #[test]
    fn percent_encodes_utf8_and_reserved_characters() {
        let body = encode_form_body(&pairs(&[
            ("message", "ĺäö/?=&+ abc"),
            ("extension", "+46700634607,+46700634608"),
        ]));
        assert_eq!(
            body,
            "message=%C4%BA%C3%A4%C3%B6%2F%3F%3D%26%2B+abc&extension=%2B46700634607%2C%2B46700634608"
        );
    }

    #[test]
    fn decodes_back_to_the_same_pairs() {
        let params = pairs(&[("postpone", "01:15 070124"), ("key_value", "a=b&c")]);
        let body = encode_form_body(&params);
        let decoded = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect::<Vec<_>>();
        assert_eq!(decoded, params);
    }
}
