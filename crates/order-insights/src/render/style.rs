/// Inline stylesheet for the dashboard document.
pub(crate) fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: "Source Sans Pro", system-ui, -apple-system, "Segoe UI", sans-serif;
    color: #31333f;
    background: #ffffff;
    display: flex;
    min-height: 100vh;
}

/* Sidebar */
aside {
    width: 300px;
    flex-shrink: 0;
    padding: 2rem 1.5rem;
    background: #f0f2f6;
}

aside h2 {
    font-size: 1.25rem;
    margin: 0 0 0.75rem 0;
}

aside section + section {
    margin-top: 2rem;
}

nav ul {
    list-style: none;
    margin: 0;
    padding: 0;
}

nav li {
    margin: 0.35rem 0;
}

nav a {
    color: inherit;
    text-decoration: none;
}

nav li.active a,
nav li.active span {
    font-weight: 700;
    color: #ff4b4b;
}

nav li::before {
    content: "○ ";
}

nav li.active::before {
    content: "◉ ";
    color: #ff4b4b;
}

form {
    display: flex;
    flex-direction: column;
    gap: 0.5rem;
}

button {
    padding: 0.4rem 0.8rem;
    border: 1px solid #d0d3da;
    border-radius: 0.4rem;
    background: #ffffff;
    cursor: pointer;
}

.dataset-summary {
    font-size: 0.875rem;
    margin-top: 0.75rem;
}

.dataset-summary dt {
    font-weight: 600;
}

.dataset-summary dd {
    margin: 0 0 0.4rem 0;
}

.column-table {
    width: 100%;
    font-size: 0.8rem;
    border-collapse: collapse;
    margin-top: 0.5rem;
}

.column-table th,
.column-table td {
    text-align: left;
    padding: 0.15rem 0.3rem;
    border-bottom: 1px solid #e6e9ef;
}

.column-table td.nulls {
    text-align: right;
}

/* Main column */
main {
    flex: 1;
    padding: 2rem 3rem;
    max-width: 1100px;
}

main h1 {
    font-size: 2.25rem;
    margin-top: 0;
}

.warning {
    padding: 1rem;
    border-radius: 0.5rem;
    background: #fffce7;
    color: #926c05;
}

.error {
    padding: 1rem;
    border-radius: 0.5rem;
    background: #ffebee;
    color: #7d353b;
}

.error code {
    font-size: 0.8rem;
}

.chart {
    margin: 1.5rem 0;
    overflow-x: auto;
}
"#
}
