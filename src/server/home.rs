use axum::response::Html;

/// Static usage page served at `/`.
const HOME_PAGE: &str = r#"
<html>
	<head>
	<link rel="stylesheet" href="https://unpkg.com/purecss@1.0.0/build/base-min.css">
	<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/github-markdown-css/3.0.1/github-markdown.min.css">
	</head>
	<article class="markdown-body">
	<div style="max-width:1000px;padding-left:20px;padding-right:20px;margin:auto">
		<h1> GitHub Release Downloader </h1>
		<p>
			This service helps you download the latest binaries from GitHub releases quickly
			using curl or wget.
		</p>
		<p>
			Request <code>/&lt;owner&gt;/&lt;repo&gt;</code> and you are redirected to the release
			asset matching your OS and architecture.
		</p>
	</div>
	<div style="max-width:1000px;padding-left:20px;padding-right:20px;margin:auto;min-width:845px">
		<p>
			Download and untar the <b>latest</b> release for your OS (inferred from wget's
			<code>User-Agent</code>): <br />
			<code>wget -qO- "https://getbin.example/owner/repo" | tar xvz</code> <br />
		</p>
		<p>
			You can also pick the platform explicitly. <code>os</code> can be <code>darwin</code>,
			<code>linux</code>, or <code>windows</code>; <code>arch</code> can be <code>amd64</code>,
			<code>x86</code>, or <code>arm64</code>: <br />
			<code>wget -qO- "https://getbin.example/owner/repo?os=darwin&arch=arm64" | tar xvz</code> <br />
		</p>
		<p>
			Or let the server uncompress the asset for you: <br />
			<code>wget --content-disposition "https://getbin.example/owner/repo?os=darwin&uncompress=true"</code> <br />
		</p>
		<p>
			You can also use <code>curl</code>. Note, you must always specify <code>os</code> with curl. <br />
			<code> curl -LJ "https://getbin.example/owner/repo?os=darwin" | tar xvz </code> <br />
		</p>
	</div>
	</article>
</html>
"#;

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
