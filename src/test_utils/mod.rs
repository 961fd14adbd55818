#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_string};
pub(crate) use http::{assert_content_type, get_test_state, json_body};
