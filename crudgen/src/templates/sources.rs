//! Built-in template sources (MiniJinja syntax)

/// CRUD controller backed by JSON files on disk
pub const CONTROLLER_JSON: &str = r#"/**
 * {{ controller_name }}
 *
 * @description Server-side actions for {{ title }} records stored as JSON files.
 * Generated on {{ created_at }}.
 */
const fs = require('fs');
const path = require('path');
const crypto = require('crypto');
const schema = require('../models/schema/{{ entity_name }}');

const STORE = path.resolve(__dirname, '../../.data/{{ route_segment }}.json');

function load() {
  if (!fs.existsSync(STORE)) {
    return [];
  }
  return JSON.parse(fs.readFileSync(STORE, 'utf8'));
}

function save(records) {
  fs.mkdirSync(path.dirname(STORE), { recursive: true });
  fs.writeFileSync(STORE, JSON.stringify(records, null, 2));
}

function pick(body) {
  return Object.keys(schema.properties)
    .filter(key => key !== 'id' && body[key] !== undefined)
    .reduce((acc, key) => Object.assign(acc, { [key]: body[key] }), {});
}

module.exports = {
  async list(req, res) {
    return res.ok(load());
  },

  async stats(req, res) {
    return res.ok({ count: load().length });
  },

  async get(req, res) {
    const record = load().find(r => r.id === req.params.id);
    return record ? res.ok(record) : res.notFound();
  },

  async post(req, res) {
    const records = load();
    const record = Object.assign({ id: crypto.randomUUID(), createdAt: new Date().toISOString() }, pick(req.body));
    records.push(record);
    save(records);
    return res.created(record);
  },

  async put(req, res) {
    const records = load();
    const index = records.findIndex(r => r.id === req.params.id);
    if (index === -1) {
      return res.notFound();
    }
    records[index] = Object.assign({ id: records[index].id, createdAt: records[index].createdAt }, pick(req.body));
    save(records);
    return res.ok(records[index]);
  },

  async patch(req, res) {
    const records = load();
    const index = records.findIndex(r => r.id === req.params.id);
    if (index === -1) {
      return res.notFound();
    }
    Object.assign(records[index], pick(req.body));
    save(records);
    return res.ok(records[index]);
  },

  async export(req, res) {
    const record = load().find(r => r.id === req.params.id);
    if (!record) {
      return res.notFound();
    }
    res.attachment('{{ route_segment }}-' + record.id + '.json');
    return res.send(JSON.stringify(record, null, 2));
  },

  async import(req, res) {
    const records = load();
    const index = records.findIndex(r => r.id === req.params.id);
    const incoming = Object.assign(pick(req.body), { id: req.params.id });
    if (index === -1) {
      records.push(incoming);
    } else {
      records[index] = Object.assign(records[index], incoming);
    }
    save(records);
    return res.ok(incoming);
  },

  async delete(req, res) {
    const records = load();
    const remaining = records.filter(r => r.id !== req.params.id);
    if (remaining.length === records.length) {
      return res.notFound();
    }
    save(remaining);
    return res.ok();
  },
};
"#;

/// CRUD controller backed by Sequelize
pub const CONTROLLER_SQL: &str = r#"/**
 * {{ controller_name }}
 *
 * @description Server-side actions for {{ title }} records stored in SQL.
 * Generated on {{ created_at }}.
 */
const { {{ entity_name }} } = require('../../resources/sql/models');

async function findOr404(req, res) {
  const record = await {{ entity_name }}.findByPk(req.params.id);
  if (!record) {
    res.notFound();
  }
  return record;
}

module.exports = {
  async list(req, res) {
    try {
      const records = await {{ entity_name }}.findAll({ where: req.query });
      return res.ok(records);
    } catch (err) {
      return res.serverError(err);
    }
  },

  async stats(req, res) {
    try {
      const count = await {{ entity_name }}.count();
      return res.ok({ count });
    } catch (err) {
      return res.serverError(err);
    }
  },

  async get(req, res) {
    try {
      const record = await findOr404(req, res);
      return record && res.ok(record);
    } catch (err) {
      return res.serverError(err);
    }
  },

  async post(req, res) {
    try {
      const record = await {{ entity_name }}.create(req.body);
      return res.created(record);
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async put(req, res) {
    try {
      const record = await findOr404(req, res);
      if (!record) {
        return undefined;
      }
      await record.update(req.body);
      return res.ok(record);
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async patch(req, res) {
    try {
      const record = await findOr404(req, res);
      if (!record) {
        return undefined;
      }
      await record.update(req.body, { fields: Object.keys(req.body) });
      return res.ok(record);
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async export(req, res) {
    try {
      const record = await findOr404(req, res);
      if (!record) {
        return undefined;
      }
      res.attachment('{{ route_segment }}-' + record.id + '.json');
      return res.send(JSON.stringify(record.toJSON(), null, 2));
    } catch (err) {
      return res.serverError(err);
    }
  },

  async import(req, res) {
    try {
      const [record] = await {{ entity_name }}.upsert(Object.assign({}, req.body, { id: req.params.id }));
      return res.ok(record);
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async delete(req, res) {
    try {
      const removed = await {{ entity_name }}.destroy({ where: { id: req.params.id } });
      return removed ? res.ok() : res.notFound();
    } catch (err) {
      return res.serverError(err);
    }
  },
};
"#;

/// CRUD controller backed by a `MongoDB` Waterline model
pub const CONTROLLER_MONGO: &str = r#"/**
 * {{ controller_name }}
 *
 * @description Server-side actions for {{ title }} records stored in MongoDB.
 * Generated on {{ created_at }}.
 */
module.exports = {
  async list(req, res) {
    try {
      const records = await {{ entity_name }}.find(req.query);
      return res.ok(records);
    } catch (err) {
      return res.serverError(err);
    }
  },

  async stats(req, res) {
    try {
      const count = await {{ entity_name }}.count();
      return res.ok({ count });
    } catch (err) {
      return res.serverError(err);
    }
  },

  async get(req, res) {
    try {
      const record = await {{ entity_name }}.findOne({ id: req.params.id });
      return record ? res.ok(record) : res.notFound();
    } catch (err) {
      return res.serverError(err);
    }
  },

  async post(req, res) {
    try {
      const record = await {{ entity_name }}.create(req.body).fetch();
      return res.created(record);
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async put(req, res) {
    try {
      const record = await {{ entity_name }}.updateOne({ id: req.params.id }).set(req.body);
      return record ? res.ok(record) : res.notFound();
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async patch(req, res) {
    try {
      const record = await {{ entity_name }}.updateOne({ id: req.params.id }).set(req.body);
      return record ? res.ok(record) : res.notFound();
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async export(req, res) {
    try {
      const record = await {{ entity_name }}.findOne({ id: req.params.id });
      if (!record) {
        return res.notFound();
      }
      res.attachment('{{ route_segment }}-' + record.id + '.json');
      return res.send(JSON.stringify(record, null, 2));
    } catch (err) {
      return res.serverError(err);
    }
  },

  async import(req, res) {
    try {
      const existing = await {{ entity_name }}.findOne({ id: req.params.id });
      const record = existing
        ? await {{ entity_name }}.updateOne({ id: req.params.id }).set(req.body)
        : await {{ entity_name }}.create(Object.assign({}, req.body, { id: req.params.id })).fetch();
      return res.ok(record);
    } catch (err) {
      return res.badRequest(err);
    }
  },

  async delete(req, res) {
    try {
      const record = await {{ entity_name }}.destroyOne({ id: req.params.id });
      return record ? res.ok() : res.notFound();
    } catch (err) {
      return res.serverError(err);
    }
  },
};
"#;

/// API test suite exercising every generated route
pub const CONTROLLER_TEST: &str = r#"/**
 * API tests for {{ controller_name }}.
 * Generated on {{ created_at }}.
 */
const request = require('supertest');
const { expect } = require('chai');

describe('{{ controller_name }}', () => {
  const base = '{{ route_base }}';
  let app;
  let created;

  before(() => {
    app = sails.hooks.http.app;
  });

  it('POST ' + base + ' creates a record', async () => {
    const res = await request(app).post(base).send({}).expect(201);
    created = res.body;
    expect(created).to.have.property('id');
  });

  it('GET ' + base + ' lists records', async () => {
    const res = await request(app).get(base).expect(200);
    expect(res.body).to.be.an('array');
  });

  it('GET ' + base + '/stats counts records', async () => {
    const res = await request(app).get(base + '/stats').expect(200);
    expect(res.body.count).to.be.at.least(1);
  });

  it('GET ' + base + '/:id returns one record', async () => {
    const res = await request(app).get(base + '/' + created.id).expect(200);
    expect(res.body.id).to.equal(created.id);
  });

  it('PUT ' + base + '/:id replaces a record', async () => {
    await request(app).put(base + '/' + created.id).send({}).expect(200);
  });

  it('PATCH ' + base + '/:id updates a record', async () => {
    await request(app).patch(base + '/' + created.id).send({}).expect(200);
  });

  it('PATCH ' + base + '/:id/export exports a record', async () => {
    await request(app).patch(base + '/' + created.id + '/export').expect(200);
  });

  it('PATCH ' + base + '/:id/import imports a record', async () => {
    await request(app).patch(base + '/' + created.id + '/import').send({}).expect(200);
  });

  it('DELETE ' + base + '/:id removes a record', async () => {
    await request(app).delete(base + '/' + created.id).expect(200);
    await request(app).get(base + '/' + created.id).expect(404);
  });
});
"#;

/// JSON-shape schema
pub const SCHEMA_JSON: &str = r#"/**
 * {{ entity_name }} schema.
 * Generated on {{ created_at }}.
 */
module.exports = {
  $id: '{{ entity }}',
  type: 'object',
  properties: {
    id: { type: 'string' },
{% for field in fields %}    {{ field.name }}: { type: 'string' },
{% endfor %}    createdAt: { type: 'string', format: 'date-time' },
  },
  required: [{% for field in fields %}'{{ field.name }}'{% if not loop.last %}, {% endif %}{% endfor %}],
  additionalProperties: false,
};
"#;

/// Sequelize model definition
pub const SCHEMA_SQL: &str = r#"/**
 * {{ entity_name }} Sequelize model.
 * Generated on {{ created_at }}.
 */
module.exports = (sequelize, DataTypes) => {
  const {{ entity_name }} = sequelize.define('{{ entity_name }}', {
    id: {
      type: DataTypes.INTEGER,
      primaryKey: true,
      autoIncrement: true,
    },
{% for field in fields %}    {{ field.name }}: {
      type: DataTypes.STRING,
      field: '{{ field.column_name }}',
    },
{% endfor %}  }, {
    tableName: '{{ table_name }}',
    timestamps: true,
  });

  return {{ entity_name }};
};
"#;
