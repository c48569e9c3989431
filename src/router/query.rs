use crate::http::escape::escape_html;
use crate::http::response::Response;
use crate::http::url::parse_url;
use crate::router::STATIC_PREFIX;
use crate::search::RankingEngine;

/// Logo and search form shown at the top of every search page.
pub const PAGE_HEADER: &str = "<html><head><title>searchd</title></head>\n\
<body>\n\
<center style=\"font-size:500%;\">\n\
<span style=\"color:blue;\">s</span>\
<span style=\"color:red;\">e</span>\
<span style=\"color:gold;\">a</span>\
<span style=\"color:blue;\">r</span>\
<span style=\"color:green;\">c</span>\
<span style=\"color:red;\">h</span>\n\
</center>\n\
<p>\n\
<div style=\"height:20px;\"></div>\n\
<center>\n\
<form action=\"/query\" method=\"get\">\n\
<input type=\"text\" size=30 name=\"terms\" />\n\
<input type=\"submit\" value=\"Search\" />\n\
</form>\n\
</center><p>\n";

const PAGE_FOOTER: &str = "</body>\r\n</html>\r\n";

/// Present in the URI only when the search form was submitted.
const QUERY_MARKER: &str = "query?terms=";

/// Renders the search page, with results when a query was submitted.
pub fn handle_query_request(uri: &str, engine: &dyn RankingEngine) -> Response {
    let mut response = Response::ok(PAGE_HEADER);
    response.set_content_type("text/html");

    let parts = parse_url(uri);
    let query = parts
        .args
        .get("terms")
        .map(|t| t.trim().to_lowercase())
        .unwrap_or_default();

    if uri.contains(QUERY_MARKER) {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_string).collect();
        let results = engine.process_query(&tokens);
        let escaped_query = escape_html(&query);

        if results.is_empty() {
            response.append_to_body("<p><br>\r\nNo results found for ");
            response.append_to_body(&escaped_query);
            response.append_to_body("\r\n<p>\r\n\r\n");
        } else {
            let noun = if results.len() == 1 { "result" } else { "results" };
            response.append_to_body(format!(
                "<p><br>\r\n{} {} found for {}\r\n<p>\r\n\r\n",
                results.len(),
                noun,
                escaped_query
            ));

            response.append_to_body("<ul>\r\n");
            for result in &results {
                let href = if is_external(&result.document_name) {
                    result.document_name.clone()
                } else {
                    format!("{STATIC_PREFIX}{}", result.document_name)
                };

                response.append_to_body(format!(
                    " <li> <a href=\"{}\">{}</a> [{}]<br>\r\n",
                    escape_html(&href),
                    escape_html(&result.document_name),
                    result.rank
                ));
            }
            response.append_to_body("</ul>\r\n");
        }
    }

    response.append_to_body(PAGE_FOOTER);
    response
}

/// Documents already named by a full URL are linked directly.
fn is_external(document_name: &str) -> bool {
    document_name.starts_with("http://") || document_name.starts_with("https://")
}
