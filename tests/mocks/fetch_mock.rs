use wasm_bindgen::prelude::*;

/// Replaces `window.fetch` so form submissions can be inspected without a server.
/// Every request is answered with `status` and a small JSON message.
#[wasm_bindgen(inline_js = r#"
export function setup_fetch_mock(status) {
    window.__fetchMock = { calls: 0, method: null, path: null, fields: null, status: status };
    window.fetch = async function(input, init) {
        const request = input instanceof Request ? input : new Request(input, init);
        const mock = window.__fetchMock;
        mock.calls += 1;
        mock.method = request.method;
        mock.path = new URL(request.url, window.location.href).pathname;
        if (request.method === "POST") {
            const form = await request.formData();
            const fields = {};
            for (const [key, value] of form.entries()) {
                fields[key] = typeof value === "string" ? value : "file:" + value.name;
            }
            mock.fields = fields;
        }
        console.log("[MOCK FETCH]", mock.method, mock.path, "->", mock.status);
        return new Response(JSON.stringify({ message: "mocked" }), {
            status: mock.status,
            headers: { "Content-Type": "application/json" },
        });
    };
}

export function fetch_mock_calls() {
    return window.__fetchMock ? window.__fetchMock.calls : 0;
}

export function fetch_mock_request() {
    const mock = window.__fetchMock;
    return mock && mock.method ? mock.method + " " + mock.path : undefined;
}

export function fetch_mock_field(name) {
    const fields = window.__fetchMock && window.__fetchMock.fields;
    return fields && name in fields ? fields[name] : undefined;
}

export function fetch_mock_field_count() {
    const fields = window.__fetchMock && window.__fetchMock.fields;
    return fields ? Object.keys(fields).length : 0;
}
"#)]
extern "C" {
    pub fn setup_fetch_mock(status: u16);
    pub fn fetch_mock_calls() -> u32;
    pub fn fetch_mock_request() -> Option<String>;
    pub fn fetch_mock_field(name: &str) -> Option<String>;
    pub fn fetch_mock_field_count() -> u32;
}
