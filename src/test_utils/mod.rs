#![allow(missing_docs)]

pub(crate) mod clock;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use clock::clock_at;
pub(crate) use form::{assert_form_control, assert_hx_endpoint, must_get_form, selected_option};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_texts};
pub(crate) use http::{assert_content_type, assert_status_ok};
