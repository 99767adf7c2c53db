pub fn render_index() -> &'static str {
    INDEX_HTML
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Streams of browsing</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #22252a;
      --muted: #6b6f76;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 18px 48px rgba(34, 37, 42, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    header {
      max-width: 1100px;
      margin: 0 auto 24px;
      font-size: 1.2rem;
    }

    main {
      max-width: 1100px;
      margin: 0 auto;
      display: flex;
      flex-wrap: wrap;
      gap: 28px;
    }

    .card {
      flex: 1 1 480px;
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 28px;
    }

    .card h2 {
      margin: 0 0 4px;
      font-size: 0.95rem;
      color: var(--muted);
      font-weight: 500;
    }

    .metric {
      margin: 0 0 18px;
      font-size: 1.8rem;
      font-weight: 600;
    }

    select {
      font: inherit;
      padding: 6px 10px;
      border-radius: 10px;
      margin-bottom: 18px;
    }

    svg {
      width: 100%;
      height: auto;
    }

    .axis-label {
      font-size: 10px;
      fill: var(--muted);
    }

    .clusters {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 8px;
    }

    .clusters button {
      font: inherit;
      width: 100%;
      text-align: left;
      border: 1px solid #ddd;
      background: white;
      border-radius: 10px;
      padding: 8px 12px;
      cursor: pointer;
    }

    .pages {
      font-size: 0.85rem;
      color: var(--muted);
      word-break: break-all;
    }

    .status[data-type="error"] {
      color: #b3261e;
    }
  </style>
</head>
<body>
  <header>Streams of browsing</header>
  <main>
    <section class="card">
      <h2>Recently used tabs</h2>
      <p class="metric" id="total">-- events</p>
      <select id="runs" aria-label="Clustering run"></select>
      <svg id="chart" viewBox="0 0 640 300" role="img" aria-label="Events per hour by cluster"></svg>
      <div class="status" id="status"></div>
    </section>
    <section class="card">
      <h2>Clusters</h2>
      <ul class="clusters" id="clusters"></ul>
    </section>
  </main>

  <script>
    const runsEl = document.getElementById('runs');
    const chartEl = document.getElementById('chart');
    const totalEl = document.getElementById('total');
    const statusEl = document.getElementById('status');
    const clustersEl = document.getElementById('clusters');
    const palette = ['#ff6b4a', '#2f4858', '#f6ae2d', '#33658a', '#86bbd8', '#9c6644', '#758e4f', '#c44569'];

    let latestRequest = 0;
    let latestClustersRequest = 0;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const renderChart = (buckets, keys) => {
      if (!buckets.length) {
        chartEl.innerHTML = '<text class="axis-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 640;
      const height = 300;
      const left = 36;
      const bottom = 40;
      const top = 12;
      const plotHeight = height - top - bottom;
      const totals = buckets.map((bucket) => keys.reduce((sum, key) => sum + (bucket[key] || 0), 0));
      const max = Math.max(1, ...totals);
      const slot = (width - left) / buckets.length;
      const barWidth = Math.max(2, slot * 0.7);
      const labelEvery = Math.ceil(buckets.length / 12);

      let svg = `<text class="axis-label" x="4" y="${top + 8}">${max}</text>`;
      buckets.forEach((bucket, index) => {
        const x = left + index * slot + (slot - barWidth) / 2;
        let y = top + plotHeight;
        keys.forEach((key, keyIndex) => {
          const value = bucket[key] || 0;
          if (!value) {
            return;
          }
          const barHeight = (value / max) * plotHeight;
          y -= barHeight;
          svg += `<rect x="${x}" y="${y}" width="${barWidth}" height="${barHeight}" fill="${palette[keyIndex % palette.length]}"><title>${escapeText(key)}: ${value}</title></rect>`;
        });
        if (index % labelEvery === 0) {
          svg += `<text class="axis-label" x="${x + barWidth / 2}" y="${height - bottom + 16}" text-anchor="middle">${escapeText(bucket.timestamp_bucket)}</text>`;
        }
      });
      chartEl.innerHTML = svg;
    };

    const loadBuckets = async (run) => {
      const request = ++latestRequest;
      setStatus('Loading...');
      try {
        const res = await fetch(`/api/event-buckets?clustering_run=${encodeURIComponent(run)}`);
        if (!res.ok) {
          throw new Error(await res.text());
        }
        const data = await res.json();
        if (request !== latestRequest) {
          return;
        }
        totalEl.textContent = `${data.total_events} events`;
        renderChart(data.buckets, data.cluster_keys);
        setStatus('');
      } catch (err) {
        if (request === latestRequest) {
          setStatus(`Could not load activity: ${err.message}`, 'error');
        }
      }
    };

    const loadPages = async (clusterId, target) => {
      const res = await fetch(`/api/pages?cluster_id=${encodeURIComponent(clusterId)}`);
      if (!res.ok) {
        target.textContent = 'Could not load pages';
        return;
      }
      const pages = await res.json();
      target.innerHTML = pages.map((url) => `<div>${escapeText(url)}</div>`).join('');
    };

    const loadClusters = async (run) => {
      const request = ++latestClustersRequest;
      const res = await fetch('/api/clusters');
      if (request !== latestClustersRequest) {
        return;
      }
      if (!res.ok) {
        clustersEl.innerHTML = '<li>Could not load clusters</li>';
        return;
      }
      const clusters = (await res.json()).filter((cluster) => cluster.clustering_run === run);
      if (request !== latestClustersRequest) {
        return;
      }
      clustersEl.innerHTML = '';
      clusters.forEach((cluster) => {
        const item = document.createElement('li');
        const button = document.createElement('button');
        const pages = document.createElement('div');
        pages.className = 'pages';
        button.textContent = cluster.name || cluster.id;
        button.addEventListener('click', () => loadPages(cluster.id, pages));
        item.append(button, pages);
        clustersEl.append(item);
      });
    };

    const selectRun = (run) => {
      loadBuckets(run);
      loadClusters(run);
    };

    const init = async () => {
      try {
        const res = await fetch('/api/clustering-runs');
        if (!res.ok) {
          throw new Error(await res.text());
        }
        const runs = await res.json();
        runsEl.innerHTML = runs.map((run) => `<option value="${escapeText(run)}">${escapeText(run)}</option>`).join('');
        if (runs.length) {
          selectRun(runs[0]);
        } else {
          renderChart([], []);
        }
      } catch (err) {
        setStatus(`Could not load clustering runs: ${err.message}`, 'error');
      }
    };

    runsEl.addEventListener('change', () => selectRun(runsEl.value));
    init();
  </script>
</body>
</html>
"#;
