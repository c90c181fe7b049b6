pub fn syntax_error_detail(error: nom::Err<nom::error::Error<&str>>) -> String {
    match error {
        nom::Err::Error(err) | nom::Err::Failure(err) if err.input.trim().is_empty() => {
            "unexpected end of line".to_string()
        }
        nom::Err::Error(err) | nom::Err::Failure(err) => {
            format!("could not parse '{}'", err.input.trim())
        }
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
    }
}

pub fn syntax_error_unparsed_detail(input: &str) -> String {
    format!("unexpected trailing input '{input}'")
}
